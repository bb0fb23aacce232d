use std::error::Error;
use std::io::Write;

use cs_model::Class;

pub fn display_class<W: Write>(mut w: W, class: &Class) -> Result<(), Box<dyn Error>> {
    let (major, minor) = class.version;
    writeln!(w, ".class file version {major}.{minor}")?;
    writeln!(w)?;

    writeln!(
        w,
        "class {} extends {}{} {{",
        class.path,
        class.super_,
        if class.interfaces.is_empty() {
            String::new()
        } else {
            format!(
                " implements {}",
                class
                    .interfaces
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        }
    )?;

    if !class.inner_types.is_empty() {
        writeln!(w, " Inner classes:")?;
        for inner in &class.inner_types {
            writeln!(w, "  {}", inner.inner)?;
        }
    }

    writeln!(w, " Fields:")?;
    for field in &class.fields {
        writeln!(w, "  {} {}", field.signature, field.name)?;
    }
    writeln!(w)?;

    writeln!(w, " Methods:")?;
    for method in &class.methods {
        writeln!(w, "  {} {}", method.signature, method.name)?;
    }

    writeln!(w, "}}")?;
    Ok(())
}
