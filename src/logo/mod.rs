//! The AnimatedLogo component: state machine, shapes, stylesheet and scene evaluation.

pub mod component;
pub mod phase;
pub mod scene;
pub mod shapes;
pub mod styles;
pub mod timeline;
