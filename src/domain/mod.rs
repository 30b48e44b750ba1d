// Domain layer - Core types and the compatibility rules

pub mod model;
pub mod rules;
