#[derive(Debug, PartialEq)]
pub enum EventResult {
    None,
    Quit,
    Command(EventCommand),
}

#[derive(Debug, PartialEq)]
pub enum EventCommand {
    ApplyPending {
        install: Vec<String>,
        remove: Vec<String>,
    },
    SyncDatabase,
}
