fn main() {
    std::process::exit(glsl_shader_demo::run());
}
