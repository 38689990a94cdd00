use std::env;
use std::process::ExitCode;

use numstrconv::{parse_u16, parse_u32, parse_u64, parse_u8, ConvError};

///! Parses an unsigned integer and prints the value and the unparsed rest.
///!  cargo run --example parse_int 0x1f,rest l

fn parse(input: &[u8], kind: &str) -> Result<(u64, usize), String> {
    let res = match kind.as_bytes().first() {
        Some(b'b') => parse_u8(input).map(|p| p.map(u64::from)),
        Some(b'h') => parse_u16(input).map(|p| p.map(u64::from)),
        Some(b'i') => parse_u32(input).map(|p| p.map(u64::from)),
        Some(b'l') => parse_u64(input),
        _ => return Err("Unknown type".to_string()),
    };
    res.map(|p| (p.value, p.end))
        .map_err(|err: ConvError| err.to_string())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: parse_int number_with_delim b|h|i|l [numchars]");
        return ExitCode::SUCCESS;
    }

    let text = args[1].as_bytes();
    let mut len = text.len();
    if args.len() == 4 {
        match args[3].parse::<usize>() {
            Ok(0) => {}
            Ok(n) => len = n.min(text.len()),
            Err(_) => {
                eprintln!("Cant parse numchars");
                return ExitCode::FAILURE;
            }
        }
    }

    match parse(&text[..len], &args[2]) {
        Ok((value, end)) => {
            println!("{}", value);
            println!("{}", String::from_utf8_lossy(&text[end..]));
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("Failed: {}", msg);
            ExitCode::FAILURE
        }
    }
}
