fn main() {
    // ESP-IDF link arguments are only needed for the device build; host
    // test builds run without the `espidf` feature.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
