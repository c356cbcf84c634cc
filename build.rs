fn main() {
    // ESP-IDF environment (linker args, sdkconfig) is only needed for the
    // on-target build; host tests and the simulation skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
