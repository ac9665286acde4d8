fn main() {
    slint_build::compile("ui/panel.slint").expect("slint build failed");
}
