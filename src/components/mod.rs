pub mod control_panel;
pub mod sphere_topology;
pub mod topology_view;
