use std::fmt::Write;

use monitor_core::{
    AggregateRow, DashboardReport, FairShareLayout, HeartbeatStatus, QueueStatus,
    ReconciledAllocation, RequestStatus, ResourceLayout, StatusAggregation, StatusCode,
    TapeQueueSummary,
};

/// Characters per 100% of a resource in the fair share bars.
const BAR_WIDTH: f64 = 50.0;
const BAND_GLYPHS: &[char] = &['#', '=', '*', '+', '%', '@', '&', '~'];

// Column order of the dashboard tables.
const QUEUE_COLUMNS: &[QueueStatus] = &[
    QueueStatus::Created,
    QueueStatus::Activated,
    QueueStatus::Ended,
    QueueStatus::Aborted,
    QueueStatus::Suspended,
];
const REQUEST_COLUMNS: &[RequestStatus] = &[
    RequestStatus::Created,
    RequestStatus::OnDisk,
    RequestStatus::Submitted,
    RequestStatus::Queued,
    RequestStatus::Staged,
    RequestStatus::Failed,
];

pub fn render_report(report: &DashboardReport) -> String {
    let mut out = String::new();
    render_information(&mut out, report);
    render_heartbeat(&mut out, report.heartbeat.as_ref());
    render_status_table(&mut out, "Queues", "User", &report.queues, QUEUE_COLUMNS);
    render_status_table(&mut out, "Requests", "User", &report.requests, REQUEST_COLUMNS);
    render_fair_share(&mut out, &report.fair_share);
    render_drives(&mut out, &report.allocations);
    render_tapes(&mut out, &report.tape_queues);
    if !report.anomalies.is_empty() {
        out.push_str("\nAnomalies\n");
        for anomaly in &report.anomalies {
            let _ = writeln!(out, "  ! {}", anomaly);
        }
    }
    out
}

fn render_information(out: &mut String, report: &DashboardReport) {
    if report.information.is_empty() {
        return;
    }
    out.push_str("General Information\n");
    for entry in &report.information {
        let _ = writeln!(out, "  {:<24} {}", entry.name, entry.value);
    }
    out.push('\n');
}

fn render_heartbeat(out: &mut String, heartbeat: Option<&HeartbeatStatus>) {
    out.push_str("Heartbeat\n");
    match heartbeat {
        Some(heartbeat) => {
            let marker = if heartbeat.is_stale { "  STALE" } else { "" };
            let _ = writeln!(
                out,
                "  pid {}  started {}  last beat {}s ago{}",
                heartbeat.pid, heartbeat.start_time, heartbeat.seconds_since_last_beat, marker
            );
            if !heartbeat.message.is_empty() {
                let _ = writeln!(out, "  {}", heartbeat.message);
            }
        }
        None => out.push_str("  no heartbeat recorded\n"),
    }
}

fn render_status_table<S: StatusCode>(
    out: &mut String,
    title: &str,
    owner_header: &str,
    aggregation: &StatusAggregation<S>,
    columns: &[S],
) {
    let show_unknown = aggregation.global.unknown > 0;
    let _ = writeln!(out, "\n{}", title);
    let mut header = format!("  {:<16}", owner_header);
    for status in columns {
        let _ = write!(header, " {:>10}", short_label(status.label()));
    }
    if show_unknown {
        let _ = write!(header, " {:>10}", "Unknown");
    }
    let _ = write!(header, " {:>10}", "Total");
    let _ = writeln!(out, "{}", header);
    for (owner, row) in &aggregation.by_owner {
        render_status_row(out, owner, row, columns, show_unknown);
    }
    render_status_row(out, "Total", &aggregation.global, columns, show_unknown);
}

fn render_status_row<S: StatusCode>(
    out: &mut String,
    owner: &str,
    row: &AggregateRow<S>,
    columns: &[S],
    show_unknown: bool,
) {
    let mut line = format!("  {:<16}", owner);
    for status in columns {
        let _ = write!(line, " {:>10}", row.count(*status));
    }
    if show_unknown {
        let _ = write!(line, " {:>10}", row.unknown);
    }
    let _ = write!(line, " {:>10}", row.total);
    let _ = writeln!(out, "{}", line);
}

fn short_label(label: &str) -> &str {
    match label {
        "Temporarily Suspended" => "Suspended",
        other => other,
    }
}

fn render_fair_share(out: &mut String, layout: &FairShareLayout) {
    out.push_str("\nFair Share\n");
    if layout.resources.is_empty() {
        out.push_str("  no allocations\n");
        return;
    }
    if layout.has_overbooking() {
        let _ = writeln!(
            out,
            "  overbooking column up to +{:.0}%",
            layout.max_booking_ratio * 100.0
        );
    }
    for resource in layout.resources.values() {
        let _ = writeln!(
            out,
            "  {} ({} drives)  booked {:.0}%{}",
            display_name(resource),
            resource.total_drives,
            resource.booked_percent,
            match resource.free_percent {
                Some(free) => format!("  free {:.0}%", free),
                None if resource.is_overbooked => {
                    format!("  OVERBOOKED +{:.0}%", resource.overbooking.filled_percent)
                }
                None => String::new(),
            }
        );
        let _ = writeln!(out, "  [{}]", share_bar(resource));
        for (index, entry) in resource.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "    {} {:<16} {:>5.1}%",
                BAND_GLYPHS[index % BAND_GLYPHS.len()],
                entry.user_id,
                entry.width_percent
            );
        }
    }
}

/// Bands, then free space up to 100%, then the overbooking column. The
/// column has the same width on every resource.
fn share_bar(resource: &ResourceLayout) -> String {
    let mut bar = String::new();
    let mut cumulative = 0.0;
    let mut drawn = 0usize;
    for (index, entry) in resource.entries.iter().enumerate() {
        cumulative += entry.width_percent;
        let end = columns_for(cumulative);
        let glyph = BAND_GLYPHS[index % BAND_GLYPHS.len()];
        bar.extend(std::iter::repeat_n(glyph, end.saturating_sub(drawn)));
        drawn = drawn.max(end);
    }
    let full = columns_for(100.0);
    if drawn < full {
        bar.extend(std::iter::repeat_n('.', full - drawn));
        drawn = full;
    }
    let total = full + columns_for(resource.overbooking.width_percent);
    if drawn < total {
        bar.extend(std::iter::repeat_n(' ', total - drawn));
    }
    bar
}

fn columns_for(percent: f64) -> usize {
    (percent / 100.0 * BAR_WIDTH).round().max(0.0) as usize
}

fn display_name(resource: &ResourceLayout) -> String {
    if resource.resource_name.is_empty() {
        format!("resource {}", resource.resource_id)
    } else {
        resource.resource_name.clone()
    }
}

fn render_drives(out: &mut String, allocations: &[ReconciledAllocation]) {
    out.push_str("\nDrives Distribution\n");
    let _ = writeln!(
        out,
        "  {:<14} {:>6} {:<16} {:>9} {:>6}",
        "Media Type", "Drives", "User", "Allocated", "Used"
    );
    for record in allocations {
        let name = if record.resource_name.is_empty() {
            format!("#{}", record.resource_id)
        } else {
            record.resource_name.clone()
        };
        let _ = writeln!(
            out,
            "  {:<14} {:>6} {:<16} {:>9} {:>6}{}",
            name,
            record.total_drives,
            record.user_id,
            record.allocated_drives,
            record.used_drives,
            if record.is_orphan { "  (orphan)" } else { "" }
        );
    }
}

fn render_tapes(out: &mut String, summary: &TapeQueueSummary) {
    if summary.tapes.is_empty() {
        return;
    }
    out.push_str("\nQueues per tape\n");
    for (tape, queues) in &summary.tapes {
        let slot = |queue: &Option<monitor_core::QueueDetail>| match queue {
            Some(queue) => format!(
                "#{} {} {}MB left {}",
                queue.queue_id,
                queue.owner,
                queue.size_mb(),
                queue.remaining()
            ),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<10} created: {} | activated: {} | suspended: {}",
            tape,
            slot(&queues.created),
            slot(&queues.activated),
            slot(&queues.suspended)
        );
    }
    let _ = writeln!(
        out,
        "  Total      created: {} | activated: {} | suspended: {}",
        summary.created, summary.activated, summary.suspended
    );
}
