//! Version command handler

/// Display version information
pub fn display_version() {
    println!("provider-nop {}", env!("CARGO_PKG_VERSION"));
    println!("  {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("  License: {}", env!("CARGO_PKG_LICENSE"));
    println!(
        "  Serves: {}",
        provider_nop::models::GroupVersionKind::nop_resource()
    );
}
