use spleet_core::{AppViewModel, JobStatus, SessionState};

/// One-line status shown whenever the state changes.
pub fn render_status(view: &AppViewModel) -> String {
    if let Some(err) = &view.last_error {
        return format!("Error: {err}");
    }
    if view.progress_label.is_empty() {
        let stems = view
            .stem_count
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        return format!("Queued: {} files | Stems: {}", view.jobs.len(), stems);
    }
    match view.session {
        SessionState::Running => format!("[running] {}", view.progress_label),
        SessionState::Idle => view.progress_label.clone(),
    }
}

/// Job table in queue order: index, file name, status.
pub fn render_table(view: &AppViewModel) -> Vec<String> {
    let name_width = view
        .jobs
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("File".len());

    let mut lines = Vec::with_capacity(view.jobs.len() + 1);
    lines.push(format!("{:>3}  {:<name_width$}  Status", "#", "File"));
    for (index, row) in view.jobs.iter().enumerate() {
        let status = match &row.status {
            JobStatus::Failed { reason } => format!("Failed: {reason}"),
            other => other.label().to_string(),
        };
        lines.push(format!("{:>3}  {:<name_width$}  {}", index, row.name, status));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use spleet_core::{JobRowView, StemCount};

    fn view_with_rows() -> AppViewModel {
        AppViewModel {
            jobs: vec![
                JobRowView {
                    job_id: 1,
                    name: "a.mp3".into(),
                    status: JobStatus::Finished,
                },
                JobRowView {
                    job_id: 2,
                    name: "longer-name.wav".into(),
                    status: JobStatus::Failed {
                        reason: "bad header".into(),
                    },
                },
            ],
            stem_count: Some(StemCount::Four),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn table_aligns_names_and_shows_failure_reason() {
        let lines = render_table(&view_with_rows());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  #  File             Status");
        assert_eq!(lines[1], "  0  a.mp3            Finished");
        assert_eq!(lines[2], "  1  longer-name.wav  Failed: bad header");
    }

    #[test]
    fn status_prefers_errors_then_progress() {
        let mut view = view_with_rows();
        assert_eq!(render_status(&view), "Queued: 2 files | Stems: 4");

        view.session = SessionState::Running;
        view.progress_label = "Progress: 1 files spleeted...".into();
        assert_eq!(
            render_status(&view),
            "[running] Progress: 1 files spleeted..."
        );

        view.last_error = Some("a run is already in progress".into());
        assert_eq!(render_status(&view), "Error: a run is already in progress");
    }
}
