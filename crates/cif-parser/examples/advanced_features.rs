// Demonstrate save frames and multiple data blocks
use cif_parser::File;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let cif_content = r#"
data_block1
_item1 value1

save_frame1
_frame_item 'frame value'
loop_
_frame_loop.id
_frame_loop.value
1 'first'
2 'second'
save_

data_block2
_item2 value2
"#;

    let file = File::load(cif_content)?;
    println!("Number of data blocks: {}", file.datablocks().len());

    for block in file.datablocks() {
        println!("\nData block: {}", block.name());
        println!("  Categories: {}", block.categories().count());
        println!("  Save frames: {}", block.save_frames().len());

        for frame in block.save_frames() {
            println!("  Save frame: {}", frame.name());
            for cat in frame.categories() {
                for id in cat.row_ids() {
                    for item in cat.item_names() {
                        if let Some(value) = cat.get_value(id, item) {
                            println!("    _{}.{}: {:?}", cat.name(), item, value.as_text());
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
