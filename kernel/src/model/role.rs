use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, EnumString)]
pub enum Role {
    Manager,
    #[default]
    Staff,
}
