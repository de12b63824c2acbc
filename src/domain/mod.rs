// Domain layer: the patch document, image reference rules, promotion order and storage port. No filesystem access here.

pub mod image;
pub mod model;
pub mod ports;
pub mod promotion;
