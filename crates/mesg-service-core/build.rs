/// Builds the gRPC code for the `api.proto` definition using
/// `tonic-prost-build`.
///
/// This code generation step processes the Protocol Buffer definitions located
/// in the `proto` directory and emits Rust modules with gRPC bindings into the
/// crate's `OUT_DIR`.
///
/// # Client and Server
///
/// A MESG service only calls into the core daemon. The server stubs are
/// generated as well so a daemon can be stood up in-process, which is how the
/// gRPC connection is exercised end to end.
///
/// # Protoc
///
/// The `protoc` binary is taken from `protoc-bin-vendored` so the build does
/// not depend on a system-wide installation.
///
/// # Files and Paths
///
/// - Proto file: `proto/api.proto`
/// - Includes: `proto/`
///
/// # Panics
///
/// This function will `panic!` if code generation fails.
///
/// # Output
///
/// Generated code will be accessible in Rust via:
///
/// ```rust
/// pub mod api {
///     tonic::include_proto!("api");
/// }
/// ```
fn main() {
    println!("cargo:rerun-if-changed=proto/api.proto");

    let protoc = protoc_bin_vendored::protoc_bin_path().unwrap();

    let mut config = tonic_prost_build::Config::new();
    config.protoc_executable(protoc);

    tonic_prost_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_with_config(config, &["proto/api.proto"], &["proto"])
        .unwrap();
}
