use shadow_rs::ShadowBuilder;

fn main() {
    // Git and build metadata for `--version` and the health endpoint.
    ShadowBuilder::builder()
        .build()
        .expect("shadow-rs could not collect build metadata");
}
