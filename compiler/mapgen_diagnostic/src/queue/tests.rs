use pretty_assertions::assert_eq;

use super::*;

fn size_error(start: u32) -> Diagnostic {
    Diagnostic::error(ErrorCode::E5103)
        .with_message("negative size")
        .with_label(Span::new(start, start + 4), "this size")
}

#[test]
fn emit_error_counts_and_proves() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.has_errors().is_none());

    let _proof = queue.emit_error(size_error(0));
    assert_eq!(queue.error_count(), 1);
    assert!(queue.has_errors().is_some());
}

#[test]
fn duplicates_are_dropped() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(size_error(8)));
    assert!(!queue.add(size_error(8)));
    assert!(queue.add(size_error(20)));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn unlimited_config_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    assert!(queue.add(size_error(8)));
    assert!(queue.add(size_error(8)));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn error_limit_queues_one_notice() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 1,
        deduplicate: false,
    });
    assert!(queue.add(size_error(0)));
    assert!(queue.limit_reached());
    assert!(!queue.add(size_error(10)));
    assert!(!queue.add(size_error(20)));
    assert_eq!(queue.error_count(), 1);

    let codes: Vec<_> = queue.peek().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E5103, ErrorCode::E9002]);
    let notice = queue.peek().nth(1).unwrap();
    assert!(!notice.is_error());
    assert_eq!(notice.primary_span(), Some(Span::new(10, 14)));
}

#[test]
fn flush_rearms_the_limit_notice() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 1,
        deduplicate: true,
    });
    queue.add(size_error(0));
    queue.add(size_error(10));
    assert_eq!(queue.flush().len(), 2);

    queue.add(size_error(0));
    queue.add(size_error(10));
    let flushed = queue.flush();
    assert_eq!(flushed.len(), 2);
    assert_eq!(flushed[1].code, ErrorCode::E9002);
}

#[test]
fn flush_sorts_by_span_and_resets() {
    let mut queue = DiagnosticQueue::new();
    queue.add(size_error(30));
    queue.add(size_error(4));

    let starts: Vec<_> = queue
        .flush()
        .iter()
        .filter_map(|d| d.primary_span().map(|s| s.start))
        .collect();
    assert_eq!(starts, vec![4, 30]);
    assert_eq!(queue.error_count(), 0);
    assert_eq!(queue.peek().count(), 0);
}

#[test]
fn too_many_errors_uses_internal_code() {
    let diag = too_many_errors(50, Span::new(1, 2));
    assert_eq!(diag.code, ErrorCode::E9002);
    assert!(diag.message.contains("50"));
}
