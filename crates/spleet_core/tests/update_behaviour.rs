use std::path::PathBuf;
use std::sync::Once;

use pretty_assertions::assert_eq;
use spleet_core::{
    update, AppState, Effect, JobStatus, Msg, QueueError, RunConfig, SessionState, StemCount,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn with_files(state: AppState, files: &[&str]) -> AppState {
    let paths = files.iter().map(PathBuf::from).collect();
    update(state, Msg::FilesAdded(paths)).0
}

fn ready_state() -> AppState {
    let state = with_files(AppState::new(), &["a.mp3", "b.mp3"]);
    update(state, Msg::StemCountSelected(StemCount::Four)).0
}

#[test]
fn start_requires_stem_count() {
    init_logging();
    let state = with_files(AppState::new(), &["a.mp3"]);
    assert!(!state.can_start());

    let (state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert!(matches!(
        state.last_error(),
        Some(QueueError::InvalidConfig(_))
    ));
}

#[test]
fn start_requires_non_empty_queue() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StemCountSelected(StemCount::Two));
    assert!(!state.can_start());

    let (state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty());
    assert!(matches!(
        state.last_error(),
        Some(QueueError::InvalidConfig(_))
    ));
}

#[test]
fn start_emits_snapshot_and_config() {
    init_logging();
    let state = ready_state();
    let (state, _) = update(state, Msg::OutputDirChosen("/tmp/stems".into()));
    assert!(state.can_start());

    let (state, effects) = update(state, Msg::StartClicked);
    assert_eq!(state.session(), SessionState::Running);
    assert!(!state.can_start());
    assert_eq!(
        effects,
        vec![Effect::StartRun {
            jobs: state.queue().snapshot(),
            config: RunConfig {
                stem_count: StemCount::Four,
                output_dir: PathBuf::from("/tmp/stems"),
            },
        }]
    );
    assert_eq!(state.view().progress_label, "Progress...");
}

#[test]
fn empty_output_dir_falls_back_to_default() {
    init_logging();
    let (_state, effects) = update(ready_state(), Msg::StartClicked);
    match &effects[..] {
        [Effect::StartRun { config, .. }] => {
            assert_eq!(config.output_dir, PathBuf::from("output"));
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn second_start_while_running_is_refused() {
    init_logging();
    let (state, _) = update(ready_state(), Msg::StartClicked);
    let (state, effects) = update(state, Msg::StartClicked);

    assert!(effects.is_empty());
    assert_eq!(state.last_error(), Some(&QueueError::RunInProgress));
    assert_eq!(state.session(), SessionState::Running);
}

#[test]
fn queue_edits_are_refused_while_running() {
    init_logging();
    let (state, _) = update(ready_state(), Msg::StartClicked);
    let before = state.queue().clone();
    let first_id = before.all()[0].id;

    let (state, _) = update(state, Msg::FilesAdded(vec![PathBuf::from("c.mp3")]));
    assert_eq!(state.last_error(), Some(&QueueError::RunInProgress));
    let (state, _) = update(state, Msg::RemoveJob(first_id));
    let (state, _) = update(state, Msg::RemoveRow(0));
    let (state, _) = update(state, Msg::StemCountSelected(StemCount::Two));
    let (state, _) = update(state, Msg::OutputDirChosen("elsewhere".into()));

    assert_eq!(state.queue(), &before);
    assert_eq!(state.stem_count(), Some(StemCount::Four));
    assert_eq!(state.view().output_dir, "");
}

#[test]
fn remove_row_out_of_range_is_reported() {
    init_logging();
    let (state, effects) = update(ready_state(), Msg::RemoveRow(5));
    assert!(effects.is_empty());
    assert_eq!(
        state.last_error(),
        Some(&QueueError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(state.queue().len(), 2);
}

#[test]
fn cancel_only_applies_to_active_run() {
    init_logging();
    let (state, effects) = update(ready_state(), Msg::CancelClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::StartClicked);
    let (state, effects) = update(state, Msg::CancelClicked);
    assert_eq!(effects, vec![Effect::CancelRun]);

    // A repeated click does not send a second cancel.
    let (_state, effects) = update(state, Msg::CancelClicked);
    assert!(effects.is_empty());
}

#[test]
fn finished_jobs_stay_finished_for_the_next_run() {
    init_logging();
    let state = ready_state();
    let ids: Vec<_> = state.queue().all().iter().map(|j| j.id).collect();
    let (state, _) = update(state, Msg::StartClicked);
    let (state, _) = update(
        state,
        Msg::JobFinished {
            job_id: ids[0],
            completed: 1,
        },
    );
    let (state, _) = update(
        state,
        Msg::RunCompleted(spleet_core::RunSummary {
            completed: 1,
            failures: Vec::new(),
            cancelled: true,
        }),
    );

    let (state, effects) = update(state, Msg::StartClicked);
    match &effects[..] {
        [Effect::StartRun { jobs, .. }] => {
            assert_eq!(jobs[0].status, JobStatus::Finished);
            assert_eq!(jobs[1].status, JobStatus::Pending);
        }
        other => panic!("unexpected effects {other:?}"),
    }
    assert_eq!(state.session(), SessionState::Running);
}
