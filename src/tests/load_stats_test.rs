use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::load::{count_data_lines, LoadReport, RequestStat};

#[test]
fn test_for_report_summary() {
    let report = LoadReport::new(vec![
        RequestStat {
            latency: Duration::from_millis(100),
            events: None,
            successful: true,
        },
        RequestStat::failed(Duration::from_millis(300)),
    ]);

    assert_eq!(report.total(), 2);
    assert_eq!(report.successful(), 1);
    assert!((report.average_latency() - 0.2).abs() < 1e-9);
    assert!((report.success_percent() - 50.0).abs() < 1e-9);

    let text = report.to_string();
    assert!(text.contains("Average Latency: 0.200"));
    assert!(text.ends_with("Total Success percent: 50.00%"));
}

#[test]
fn test_for_empty_report() {
    let report = LoadReport::default();
    assert_eq!(report.average_latency(), 0.0);
    assert_eq!(report.success_percent(), 0.0);
}

#[test]
fn test_for_count_data_lines_across_chunks() {
    let mut buffer = vec![];
    let mut events = count_data_lines(&mut buffer, b"event: notification\ndata: {\"a\"");
    assert_eq!(events, 0);

    events += count_data_lines(&mut buffer, b":1}\n\nevent: notification\ndata: {}\n\n");
    assert_eq!(events, 2);
    assert!(buffer.is_empty());
}
