//! Target data: builtin sizes and alignments for a target triple.

use tracing::warn;

use super::{BuiltinKind, TypeLayout};
use crate::error::ConfigError;

/// Builtin type layouts for one target, in bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetInfo {
    pub triple: String,
    pub pointer: TypeLayout,
    pub bool_: TypeLayout,
    pub short: TypeLayout,
    pub int: TypeLayout,
    pub long: TypeLayout,
    pub long_long: TypeLayout,
    pub int128: TypeLayout,
    pub half: TypeLayout,
    pub float: TypeLayout,
    pub double: TypeLayout,
    pub long_double: TypeLayout,
    pub float128: TypeLayout,
    pub wchar: TypeLayout,
    pub char_is_signed: bool,
}

const KNOWN_ENVIRONMENTS: &[&str] = &["gnu", "msvc", "musl", "android", "eabi", "macho", "elf"];

const fn l(size: u64, align: u64) -> TypeLayout {
    TypeLayout::bits(size, align)
}

impl TargetInfo {
    /// Target data for a `arch-vendor-os[-env]` triple.
    pub fn from_triple(triple: &str) -> Result<Self, ConfigError> {
        let mut parts = triple.split('-');
        let arch = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();
        if arch.is_empty() || rest.is_empty() {
            return Err(ConfigError::invalid_target(triple, "expected arch-vendor-os"));
        }
        let windows = rest.iter().any(|p| p.starts_with("windows") || p.starts_with("win32"));
        let msvc = windows && !rest.iter().any(|p| p.starts_with("gnu"));
        let apple = rest.iter().any(|p| matches!(*p, "apple" | "darwin" | "macos" | "ios"));

        let env = rest.get(2).copied().unwrap_or("");
        if !env.is_empty() && !KNOWN_ENVIRONMENTS.iter().any(|known| env.starts_with(known)) {
            warn!(triple, env, "Unhandled target environment");
        }

        let mut info = match arch {
            "x86_64" | "amd64" => Self::lp64(triple, l(128, 128)),
            "aarch64" | "arm64" => {
                let mut info = Self::lp64(triple, l(128, 128));
                info.char_is_signed = apple || windows;
                info.wchar = l(32, 32);
                info
            }
            "riscv64" | "powerpc64" | "powerpc64le" | "s390x" | "mips64" | "mips64el" => {
                let mut info = Self::lp64(triple, l(128, 128));
                info.char_is_signed = arch.starts_with("mips");
                info
            }
            "i386" | "i486" | "i586" | "i686" | "x86" => {
                let mut info = Self::ilp32(triple);
                if !msvc {
                    info.long_long = l(64, 32);
                    info.double = l(64, 32);
                    info.long_double = l(96, 32);
                }
                info
            }
            a if a.starts_with("arm") || a.starts_with("thumb") => {
                let mut info = Self::ilp32(triple);
                info.char_is_signed = apple;
                info
            }
            "riscv32" | "wasm32" => {
                let mut info = Self::ilp32(triple);
                info.long_double = l(128, 128);
                info.char_is_signed = arch == "wasm32";
                info
            }
            _ => {
                return Err(ConfigError::invalid_target(
                    triple,
                    format!("unsupported architecture {arch}"),
                ));
            }
        };

        if windows {
            info.long = l(32, 32);
            info.wchar = l(16, 16);
            if msvc {
                info.long_double = info.double;
            }
        }
        if apple && arch == "aarch64" {
            info.long_double = info.double;
        }
        info.validate()?;
        Ok(info)
    }

    /// Target data for the machine running the extractor.
    pub fn host() -> Result<Self, ConfigError> {
        let os = match std::env::consts::OS {
            "linux" => "unknown-linux-gnu",
            "macos" => "apple-darwin",
            "windows" => "pc-windows-msvc",
            "freebsd" => "unknown-freebsd",
            other => other,
        };
        Self::from_triple(&format!("{}-{}", std::env::consts::ARCH, os))
    }

    fn lp64(triple: &str, long_double: TypeLayout) -> Self {
        Self {
            triple: triple.to_string(),
            pointer: l(64, 64),
            bool_: l(8, 8),
            short: l(16, 16),
            int: l(32, 32),
            long: l(64, 64),
            long_long: l(64, 64),
            int128: l(128, 128),
            half: l(16, 16),
            float: l(32, 32),
            double: l(64, 64),
            long_double,
            float128: l(128, 128),
            wchar: l(32, 32),
            char_is_signed: true,
        }
    }

    fn ilp32(triple: &str) -> Self {
        Self {
            pointer: l(32, 32),
            long: l(32, 32),
            long_double: l(64, 64),
            ..Self::lp64(triple, l(64, 64))
        }
    }

    /// Layout of a builtin; `None` for `void`.
    pub fn builtin(&self, kind: BuiltinKind) -> Option<TypeLayout> {
        let layout = match kind {
            BuiltinKind::Void => return None,
            BuiltinKind::Bool => self.bool_,
            BuiltinKind::Char | BuiltinKind::SChar | BuiltinKind::UChar => l(8, 8),
            BuiltinKind::WChar => self.wchar,
            BuiltinKind::Char16 => l(16, 16),
            BuiltinKind::Char32 => l(32, 32),
            BuiltinKind::Short | BuiltinKind::UShort => self.short,
            BuiltinKind::Int | BuiltinKind::UInt => self.int,
            BuiltinKind::Long | BuiltinKind::ULong => self.long,
            BuiltinKind::LongLong | BuiltinKind::ULongLong => self.long_long,
            BuiltinKind::Int128 | BuiltinKind::UInt128 => self.int128,
            BuiltinKind::Half => self.half,
            BuiltinKind::Float => self.float,
            BuiltinKind::Double => self.double,
            BuiltinKind::LongDouble => self.long_double,
            BuiltinKind::Float128 => self.float128,
            BuiltinKind::NullPtr => self.pointer,
        };
        Some(layout)
    }

    /// Every layout must be byte-sized with a power-of-two byte alignment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = [
            ("pointer", self.pointer),
            ("bool", self.bool_),
            ("short", self.short),
            ("int", self.int),
            ("long", self.long),
            ("long long", self.long_long),
            ("__int128", self.int128),
            ("half", self.half),
            ("float", self.float),
            ("double", self.double),
            ("long double", self.long_double),
            ("__float128", self.float128),
            ("wchar_t", self.wchar),
        ];
        for (name, layout) in entries {
            if layout.bit_size == 0 || layout.bit_size % 8 != 0 {
                return Err(ConfigError::invalid_target(
                    &self.triple,
                    format!("{name} has size {} bits", layout.bit_size),
                ));
            }
            if layout.bit_alignment < 8 || !layout.bit_alignment.is_power_of_two() {
                return Err(ConfigError::invalid_target(
                    &self.triple,
                    format!("{name} has alignment {} bits", layout.bit_alignment),
                ));
            }
        }
        Ok(())
    }
}
