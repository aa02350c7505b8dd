mod choose_role;
mod creating;
mod joining;
mod quiz;
mod render;
mod results;

pub use render::render;
