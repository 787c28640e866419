// This application accepts a file path to a raw XMP packet (the bytes
// between `<?xpacket begin...?>` and `<?xpacket end...?>`, or a bare
// `rdf:RDF` document), reads it, and prints a few interesting properties
// to stdout. Locating XMP inside a JPEG/PNG/TIFF/HEIC/WebP container is the
// outer image reader's job, not this crate's — see the crate docs.

use std::env;
use std::fs;

use xmp_reader::{read, LogSink, Source};

fn main() {
    let args: Vec<String> = env::args().collect();
    let path = match args.len() {
        2 => &args[1],
        n => {
            eprintln!("expected 1 argument (path to an XMP packet), got {} arguments", n.saturating_sub(1));
            std::process::exit(1);
        }
    };

    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("could not read {path}: {e}");
        std::process::exit(1);
    });

    let chunks = [xmp_reader::Chunk::new(0, bytes.len())];
    let output = read(Source::Buffer { data: &bytes, chunks: &chunks }, None, &LogSink);

    if output.tags.is_empty() {
        println!("no XMP tags found in {path}");
        return;
    }

    for name in ["CreatorTool", "CreateDate", "title", "subject", "Orientation", "RatingPercent"] {
        if let Some(tag) = output.tags.get(name) {
            println!("{name}: {}", tag.description);
        }
    }

    println!("\n{} tag(s) total", output.tags.len());
}
