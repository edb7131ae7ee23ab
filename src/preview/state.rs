// SPDX-License-Identifier: GPL-3.0-or-later

use crate::fsm::Phase;

/// One stage of the pre-print checklist. Exactly one is active at a time;
/// transitions run forward except the explicit retry edges back into a
/// `*WaitUser` state after an aborted filament operation.
///
/// Hardware-gated states (MMU, toolchanger) always exist; whether they are
/// reachable is decided at runtime by [`Capabilities`].
///
/// [`Capabilities`]: crate::capabilities::Capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Inactive,
    Init,
    Loading,
    DownloadWait,
    PreviewWaitUser,
    UnfinishedSelftestWaitUser,
    NewFirmwareAvailableWaitUser,
    ToolsMappingWaitUser,
    WrongPrinterWaitUser,
    WrongPrinterWaitUserAbort,
    FilamentNotInsertedWaitUser,
    FilamentNotInsertedLoad,
    MmuFilamentInsertedWaitUser,
    MmuFilamentInsertedUnload,
    WrongFilamentWaitUser,
    WrongFilamentChange,
    FileErrorWaitUser,
    ChecksDone,
    Done,
}

impl State {
    pub const ALL: [State; 19] = [
        State::Inactive,
        State::Init,
        State::Loading,
        State::DownloadWait,
        State::PreviewWaitUser,
        State::UnfinishedSelftestWaitUser,
        State::NewFirmwareAvailableWaitUser,
        State::ToolsMappingWaitUser,
        State::WrongPrinterWaitUser,
        State::WrongPrinterWaitUserAbort,
        State::FilamentNotInsertedWaitUser,
        State::FilamentNotInsertedLoad,
        State::MmuFilamentInsertedWaitUser,
        State::MmuFilamentInsertedUnload,
        State::WrongFilamentWaitUser,
        State::WrongFilamentChange,
        State::FileErrorWaitUser,
        State::ChecksDone,
        State::Done,
    ];
}

/// What one `loop_step` call tells the print-start caller. The caller acts
/// on this and never on [`State`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopResult {
    Inactive,
    Wait,
    Image,
    Questions,
    ToolsMapping,
    MarkStarted,
    Print,
    Abort,
}

/// Dialog shown for a state. The bookkeeping states have none.
pub fn phase_of(state: State) -> Option<Phase> {
    match state {
        State::Inactive | State::Init | State::ChecksDone | State::Done => None,
        State::Loading => Some(Phase::Loading),
        State::DownloadWait => Some(Phase::DownloadWait),
        State::PreviewWaitUser => Some(Phase::Preview),
        State::UnfinishedSelftestWaitUser => Some(Phase::UnfinishedSelftest),
        State::NewFirmwareAvailableWaitUser => Some(Phase::NewFirmwareAvailable),
        State::ToolsMappingWaitUser => Some(Phase::ToolsMapping),
        State::WrongPrinterWaitUser => Some(Phase::WrongPrinter),
        State::WrongPrinterWaitUserAbort => Some(Phase::WrongPrinterAbort),
        State::FilamentNotInsertedWaitUser => Some(Phase::FilamentNotInserted),
        State::FilamentNotInsertedLoad => Some(Phase::FilamentLoading),
        State::MmuFilamentInsertedWaitUser => Some(Phase::MmuFilamentInserted),
        State::MmuFilamentInsertedUnload => Some(Phase::MmuFilamentUnloading),
        State::WrongFilamentWaitUser => Some(Phase::WrongFilament),
        State::WrongFilamentChange => Some(Phase::FilamentChanging),
        State::FileErrorWaitUser => Some(Phase::FileError),
    }
}

/// Result reported while sitting in a state.
///
/// With `skip_preview` the caller asked to mark the print started before
/// the checklist finishes, so the transparent non-question states report
/// `MarkStarted` instead of `Wait`. Any later check can still abort.
pub fn result_of(state: State, skip_preview: bool) -> LoopResult {
    match state {
        State::Inactive => LoopResult::Inactive,
        State::Init | State::Loading | State::DownloadWait | State::ChecksDone => {
            if skip_preview {
                LoopResult::MarkStarted
            } else {
                LoopResult::Wait
            }
        }
        State::PreviewWaitUser => LoopResult::Image,
        State::ToolsMappingWaitUser => LoopResult::ToolsMapping,
        State::Done => LoopResult::Print,
        State::UnfinishedSelftestWaitUser
        | State::NewFirmwareAvailableWaitUser
        | State::WrongPrinterWaitUser
        | State::WrongPrinterWaitUserAbort
        | State::FilamentNotInsertedWaitUser
        | State::FilamentNotInsertedLoad
        | State::MmuFilamentInsertedWaitUser
        | State::MmuFilamentInsertedUnload
        | State::WrongFilamentWaitUser
        | State::WrongFilamentChange
        | State::FileErrorWaitUser => LoopResult::Questions,
    }
}
