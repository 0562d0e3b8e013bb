//! Dumps BER-TLV data.
//!
//! Provide one or more hex strings and you will receive the decoded tree
//! for each of them. White space and colons in the strings are ignored.
//! Without arguments, a sample object is dumped.
//!
//! Set `RUST_LOG=debug` to learn why decoding stopped early on malformed
//! data.

use std::env;
use bertlv::{Tlv, Tlvs};
use log::LevelFilter;
use simple_logger::SimpleLogger;

/// A private constructed value containing three primitive values.
const SAMPLE: &str = "E1 0B C1 03 01 02 03 C2 00 C3 02 AA BB";

fn from_hex(arg: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits: String = arg.chars().filter(|ch| {
        !ch.is_whitespace() && *ch != ':'
    }).collect();
    hex::decode(digits)
}

fn print_node(level: &Tlvs, node: &Tlv, indent: usize) {
    print!("{:indent$}TAG - {:#X} (", "", node.tag(), indent = indent);
    match level.tag_class(node.tag()) {
        Ok(class) => print!("{} class", class),
        Err(_) => print!("not found class"),
    }
    if level.is_constructed(node.tag()) {
        println!(", constructed)");
    }
    else {
        println!(", primitive)");
    }
    println!("{:indent$}LEN - {} bytes", "", node.length(), indent = indent);
    if node.is_primitive() {
        if let Some(value) = node.value() {
            print!("{:indent$}VAL -", "", indent = indent);
            for octet in value.iter() {
                print!(" 0x{:02X}", octet);
            }
            println!();
        }
    }
    println!();
}

fn print_level(level: &Tlvs, indent: usize) {
    for node in level {
        print_node(level, node, indent);
        if !node.children().is_empty() {
            print_level(node.children(), indent + 2);
        }
    }
}

fn process_one(arg: &str) -> Result<(), hex::FromHexError> {
    let data = from_hex(arg)?;
    log::info!("decoding {} octets", data.len());
    print_level(&bertlv::decode(&data), 0);
    Ok(())
}

fn main() {
    if let Err(err) = SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
    {
        eprintln!("failed to initialize logging: {}", err);
    }

    let args: Vec<_> = env::args().skip(1).collect();
    if args.is_empty() {
        if let Err(err) = process_one(SAMPLE) {
            println!("{}: {}.", SAMPLE, err)
        }
    }
    for arg in args {
        if let Err(err) = process_one(&arg) {
            println!("{}: {}.", arg, err)
        }
    }
}
