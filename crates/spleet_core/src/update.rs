use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// Queue edits and reconfiguration are refused while a run is active; the
/// refusal is recorded as the state's last error rather than returned.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesAdded(paths) => {
            if paths.is_empty() {
                return (state, Vec::new());
            }
            if let Err(err) = state.add_files(paths) {
                state.record_error(err);
            }
            Vec::new()
        }
        Msg::RemoveJob(job_id) => {
            if let Err(err) = state.remove_job(job_id) {
                state.record_error(err);
            }
            Vec::new()
        }
        Msg::RemoveRow(index) => {
            if let Err(err) = state.remove_row(index) {
                state.record_error(err);
            }
            Vec::new()
        }
        Msg::StemCountSelected(stems) => {
            if let Err(err) = state.select_stem_count(stems) {
                state.record_error(err);
            }
            Vec::new()
        }
        Msg::OutputDirChosen(dir) => {
            if let Err(err) = state.set_output_dir(dir) {
                state.record_error(err);
            }
            Vec::new()
        }
        Msg::StartClicked => match state.prepare_run() {
            Ok((jobs, config)) => vec![Effect::StartRun { jobs, config }],
            Err(err) => {
                state.record_error(err);
                Vec::new()
            }
        },
        Msg::CancelClicked => {
            if state.request_cancel() {
                vec![Effect::CancelRun]
            } else {
                Vec::new()
            }
        }
        Msg::JobFinished { job_id, completed } => {
            state.apply_finished(job_id, completed);
            Vec::new()
        }
        Msg::JobFailed { job_id, reason } => {
            state.apply_failed(job_id, reason);
            Vec::new()
        }
        Msg::RunCompleted(summary) => {
            state.apply_completed(summary);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
