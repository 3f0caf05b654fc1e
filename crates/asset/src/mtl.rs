//! MTL material library parser.

use std::io::BufRead;

use crate::error::AssetResult;
use crate::material::Material;
use crate::text::{directive_arg, for_each_line, read_floats};

/// Parse an MTL stream, appending every `newmtl` block to `materials`.
/// Returns how many materials were added.
///
/// Supported directives: `newmtl`, `Ns`, `Ka`, `Kd`, `Ks`, `Ke`. Color
/// coefficients are read as RGB with alpha forced to 1. Directives that
/// appear before the first `newmtl` have no material to apply to and are
/// skipped.
pub fn parse_mtl<R: BufRead>(reader: R, materials: &mut Vec<Material>) -> AssetResult<usize> {
    let first_new = materials.len();
    let mut current: Option<usize> = None;

    for_each_line(reader, |line| {
        let line = line.trim_start();
        let bytes = line.as_bytes();
        match bytes.first() {
            None | Some(b'#') => {}
            Some(b'n') => {
                current = Some(materials.len());
                materials.push(Material::named(directive_arg(line)));
            }
            Some(b'N') | Some(b'K') => {
                let Some(id) = current else {
                    log::debug!("MTL directive before any newmtl ignored: '{}'", line);
                    return;
                };
                let mat = &mut materials[id];
                let tokens = line.split_whitespace().skip(1);
                match (bytes[0], bytes.get(1)) {
                    (b'N', Some(b's')) => {
                        let mut kn = [mat.kn];
                        read_floats(tokens, &mut kn);
                        mat.kn = kn[0];
                    }
                    (b'K', Some(channel)) => {
                        let coefficient = match channel {
                            b'd' => &mut mat.kd,
                            b's' => &mut mat.ks,
                            b'a' => &mut mat.ka,
                            b'e' => &mut mat.ke,
                            _ => return,
                        };
                        read_floats(tokens, &mut coefficient[..3]);
                        coefficient[3] = 1.0;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    })?;

    Ok(materials.len() - first_new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<Material> {
        let mut materials = Vec::new();
        parse_mtl(src.as_bytes(), &mut materials).expect("parse mtl");
        materials
    }

    #[test]
    fn diffuse_gets_opaque_alpha() {
        let mats = parse("newmtl X\nKd 0.2 0.4 0.6\n");
        assert_eq!(mats.len(), 1);
        assert_eq!(mats[0].name, "X");
        assert_eq!(mats[0].kd, [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(mats[0].ka, [0.0; 4]);
    }

    #[test]
    fn all_coefficients_and_shininess() {
        let src = "# exported\n\
                   newmtl shiny\n\
                   Ns 96.078431\n\
                   Ka 0.1 0.1 0.1\n\
                   Kd 0.5 0.5 0.5\n\
                   Ks 0.9 0.8 0.7\n\
                   Ke 0.0 0.2 0.0\n\
                   Ni 1.45\n\
                   d 1.0\n\
                   illum 2\n";
        let mats = parse(src);
        let mat = &mats[0];
        assert_eq!(mat.kn, 96.078431);
        assert_eq!(mat.ka, [0.1, 0.1, 0.1, 1.0]);
        assert_eq!(mat.ks, [0.9, 0.8, 0.7, 1.0]);
        assert_eq!(mat.ke, [0.0, 0.2, 0.0, 1.0]);
    }

    #[test]
    fn indented_material_block() {
        let mats = parse("newmtl glass\n\tNs 32\n\tKd 1 0 0\n    Ks 0.5 0.5 0.5\n");
        assert_eq!(mats[0].kn, 32.0);
        assert_eq!(mats[0].kd, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mats[0].ks, [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn shininess_is_not_rescaled() {
        let mats = parse("newmtl a\nNs 1000\n");
        assert_eq!(mats[0].kn, 1000.0);
    }

    #[test]
    fn directives_apply_to_latest_material() {
        let mats = parse("newmtl a\nKd 1 0 0\nnewmtl b\nKd 0 1 0\n");
        assert_eq!(mats[0].kd, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mats[1].kd, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn directives_before_newmtl_are_skipped() {
        let mut materials = vec![Material::fallback()];
        let added = parse_mtl("Kd 0 0 0\nNs 3\nnewmtl a\n".as_bytes(), &mut materials).unwrap();
        assert_eq!(added, 1);
        assert_eq!(materials[0], Material::fallback());
    }

    #[test]
    fn malformed_numbers_keep_previous_values() {
        let mats = parse("newmtl a\nKd 0.5 oops 0.5\nNs nope\n");
        assert_eq!(mats[0].kd, [0.5, 0.0, 0.0, 1.0]);
        assert_eq!(mats[0].kn, 0.0);
    }
}
