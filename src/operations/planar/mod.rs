mod containment;
mod transform;

pub use containment::{
    clearance, clearance_of_points, contained, polygon_contains_polygon, NOT_CONTAINED,
};
pub use transform::{center, rotate, scale, shared_bounds, translate, Placement};
