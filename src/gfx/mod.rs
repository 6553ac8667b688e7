pub mod anim;
pub mod sink;
