/// The config for `Interpreter`
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Read registers holding a reference as zero instead of faulting when
    /// an integer is required
    pub coerce_references: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            coerce_references: false,
        }
    }
}
