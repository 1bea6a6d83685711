fn main() {
	sphere_topology_canvas::auto_mount();
}
