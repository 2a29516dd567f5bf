//! Scene content: the GPU point cloud, the colour-cube axes, and the 2D
//! source-image panel.

/// Colour-cube edge lines with corner-coordinate vertex colours.
pub mod axes;

/// Source-image panel UI node and visibility handling.
pub mod image_panel;

/// Point store to GPU cloud synchronisation.
pub mod point_cloud;
