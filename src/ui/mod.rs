pub mod progress;

use crate::modulation::{Family, Scheme};

pub fn print_banner() {
    eprintln!("modscope {}", env!("CARGO_PKG_VERSION"));
}

/// Scheme listing for `modscope schemes`
pub fn scheme_table() -> String {
    let mut out = format!(
        "{:<5} {:<28} {:<8} {}\n",
        "NAME", "FULL NAME", "FAMILY", "BIT CONTROLS"
    );
    for scheme in Scheme::ALL {
        let info = scheme.info();
        let family = match info.family {
            Family::Carrier => "carrier",
            Family::Pulse => "pulse",
        };
        out.push_str(&format!(
            "{:<5} {:<28} {:<8} {}\n",
            info.name, info.full_name, family, info.keyed_property
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_table_lists_all() {
        let table = scheme_table();
        assert_eq!(table.lines().count(), 1 + Scheme::ALL.len());
        assert!(table.contains("Pulse Position Modulation"));
    }
}
