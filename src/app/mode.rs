use super::timer::TimerId;

/// Where keyboard input goes.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    List,
    Input,
}

/// Something on screen a mouse click can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Toggle(TimerId),
    Reset(TimerId),
    Delete(TimerId),
    Row(usize),
    Input,
    AddButton,
}
