/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    // Navigation
    GoBack,
    Quit,

    // UI toggles
    ToggleHelp,
    ToggleDensity,
    ToggleLabelFilter,
    ShowPodDetail,

    // Pod cursor
    PodUp,
    PodDown,
    PodFirst,
    PodLast,

    // Search
    OpenSearch,
    CloseSearch,
    CancelSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,

    // Label filter overlay
    LabelUp,
    LabelDown,
    LabelSwitchColumn,
    LabelToggleValue,
    LabelClearKey,

    // Filters
    ClearFilters,

    // Refresh
    Refresh,
    CycleInterval,
    CycleIntervalBack,

    // Error handling
    ShowError(String),
}
