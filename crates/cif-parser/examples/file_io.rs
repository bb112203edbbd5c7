// Reading from files
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Parse from a file on disk:
    // let file = cif_parser::parse_file("path/to/file.cif")?;

    // For this example, parse a string instead.
    let file = cif_parser::parse_string("data_test\n_item value\n")?;

    println!("Successfully parsed {} data blocks", file.datablocks().len());
    println!("{}", file.save());

    Ok(())
}
