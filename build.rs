fn main() {
    // ESP-IDF build environment propagation (linker args, sdkconfig).
    // Host builds skip this entirely.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
