fn main() {
    // The embuild glue only applies when cross-compiling for the chip;
    // host builds (unit tests) must not require an ESP-IDF install.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
