use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Ask the plugin to update; its own throttle decides whether to fetch.
    UpdateTick,
    AnimationTick,
}
