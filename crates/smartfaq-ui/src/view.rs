/// Top-level screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Landing,
    Chat,
}

impl View {
    /// "Launch App" / "Get Started"
    pub fn launch(self) -> Self {
        View::Chat
    }

    /// "Back to Home"
    pub fn back_to_home(self) -> Self {
        View::Landing
    }
}
