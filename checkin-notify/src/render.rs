//! Completion email rendering

use chrono::Utc;

use checkin_common::catalog;
use checkin_common::fmt::format_date;
use checkin_common::notify::CompletionPayload;
use checkin_common::progress;

/// Completion statistics derived from the payload's state map
#[derive(Debug, Clone, Copy)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

/// Completed/total counts are computed over the items present in the
/// payload, which for a full check-in is the whole catalog.
pub fn completion_stats(payload: &CompletionPayload) -> CompletionStats {
    let completed = payload
        .checklist_data
        .values()
        .filter(|s| s.completed)
        .count();
    let total = payload.checklist_data.len();
    CompletionStats {
        completed,
        total,
        percent: progress::progress_percent(completed, total),
    }
}

/// Subject line for the completion email
pub fn subject(payload: &CompletionPayload) -> String {
    format!("Installation Completed - {}", payload.project_data.name)
}

/// Render the HTML completion summary
pub fn completion_email(payload: &CompletionPayload) -> String {
    let stats = completion_stats(payload);

    let completed_items: String = payload
        .checklist_data
        .iter()
        .filter(|(_, state)| state.completed)
        .map(|(id, _)| {
            let name = catalog::item(id).map(|i| i.name).unwrap_or(id.as_str());
            format!("<li>&#9989; {}</li>\n", name)
        })
        .collect();

    format!(
        r#"<html>
  <head>
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
      .header {{ background-color: #3b82f6; color: white; padding: 20px; text-align: center; }}
      .content {{ padding: 20px; }}
      .stats {{ background-color: #f8fafc; padding: 15px; border-radius: 8px; margin: 20px 0; }}
      .footer {{ background-color: #f1f5f9; padding: 15px; text-align: center; font-size: 12px; }}
      .success {{ color: #16a34a; font-weight: bold; }}
    </style>
  </head>
  <body>
    <div class="header">
      <h1>Installation Completed Successfully</h1>
    </div>

    <div class="content">
      <h2>Project Details</h2>
      <p><strong>Project:</strong> {project}</p>
      <p><strong>Client:</strong> {client}</p>
      <p><strong>Installer:</strong> {installer} ({company})</p>
      <p><strong>Check-in ID:</strong> {checkin_id}</p>
      <p><strong>Completion Date:</strong> {completion_date}</p>

      <div class="stats">
        <h3>Completion Summary</h3>
        <p class="success">&#9989; {completed} of {total} items completed ({percent}%)</p>
      </div>

      <h3>Completed Checklist Items:</h3>
      <ul>
{items}      </ul>
    </div>

    <div class="footer">
      <p>This is an automated notification from the Installer Check-in System.</p>
      <p>Check-in ID: {checkin_id}</p>
    </div>
  </body>
</html>
"#,
        project = payload.project_data.name,
        client = payload.project_data.client,
        installer = payload.installer_data.name,
        company = payload.installer_data.company,
        checkin_id = payload.checkin_id,
        completion_date = format_date(Utc::now()),
        completed = stats.completed,
        total = stats.total,
        percent = stats.percent,
        items = completed_items,
    )
}
