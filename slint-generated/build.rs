fn main() {
    println!("cargo:rerun-if-changed=ui");
    // fonts and images are rendered by the software renderer, bake them in
    println!("cargo:EMBED_TEXTURES=1");
    slint_build::compile_with_config(
        "ui/app-window.slint",
        slint_build::CompilerConfiguration::new()
            .with_style("fluent-light".into())
            .embed_resources(slint_build::EmbedResourcesKind::EmbedForSoftwareRenderer),
    )
    .expect("Slint build failed");
}
