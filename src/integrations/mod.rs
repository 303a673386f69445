//! External collaborators: the clock and the tab label feed

pub mod clock;
pub mod feed;
