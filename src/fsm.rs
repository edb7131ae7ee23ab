// SPDX-License-Identifier: GPL-3.0-or-later

/// Last button the user pressed on the current dialog. `None` means no
/// press was recorded since the dialog appeared (or changed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    None,
    Abort,
    Back,
    Continue,
    Ok,
    Yes,
    No,
    Print,
    Quit,
    Change,
    FilamentSensorsOff,
    Unload,
}

/// Externally visible dialog identifier. Derived from the checklist state,
/// never stored independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    DownloadWait,
    Preview,
    UnfinishedSelftest,
    NewFirmwareAvailable,
    ToolsMapping,
    WrongPrinter,
    WrongPrinterAbort,
    FilamentNotInserted,
    FilamentLoading,
    MmuFilamentInserted,
    MmuFilamentUnloading,
    WrongFilament,
    FilamentChanging,
    FileError,
}

impl Phase {
    /// Which button the dialog pre-highlights. Part of the phase itself so
    /// the UI layer has nothing checklist-specific to remember.
    pub fn preselect(self) -> Option<Response> {
        match self {
            Phase::Preview => Some(Response::Print),
            Phase::UnfinishedSelftest => Some(Response::Continue),
            Phase::NewFirmwareAvailable => Some(Response::Continue),
            Phase::WrongPrinter => Some(Response::Abort),
            Phase::WrongPrinterAbort => Some(Response::Abort),
            Phase::FilamentNotInserted => Some(Response::Yes),
            Phase::MmuFilamentInserted => Some(Response::Unload),
            Phase::WrongFilament => Some(Response::Change),
            Phase::FileError => Some(Response::Abort),
            _ => None,
        }
    }
}

/// What a state transition did to the on-screen dialog.
///
/// `Destroy` is reported but not executed here: tearing the dialog down is
/// the caller's job, so destruction stays atomic with the loop result that
/// caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmAction {
    NoAction,
    Create,
    Change,
    Destroy,
}

/// Bridge to whatever owns the phase-indexed dialog stack.
pub trait FsmBridge {
    fn create(&mut self, phase: Phase);

    /// Mutates the currently displayed dialog in place.
    fn change(&mut self, phase: Phase);

    /// Last button pressed on the dialog of `phase`.
    fn response(&mut self, phase: Phase) -> Response;

    /// Resets the print progress indicator to 0%.
    fn reset_print_progress(&mut self);
}
