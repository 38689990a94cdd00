use std::env;
use std::process::ExitCode;

use numstrconv::{format_float_bits, half_to_f32, parse_float_signed};
use numstrconv::{Semantics, FP16, FP32, FP64};

///! Parses a float and prints it back in the human and scientific styles.
///!  cargo run --example float_roundtrip 1e-7 f 12

fn print_value(kind: u8, bits: u64) {
    match kind {
        b'h' => {
            println!("NumStr: {:04x},{:.4e}", bits, half_to_f32(bits as u16))
        }
        b'f' => {
            let val = f32::from_bits(bits as u32);
            println!("NumStr: {:08x},{:.7e}", bits, val);
        }
        _ => {
            let val = f64::from_bits(bits);
            println!("NumStr: {:016x},{:.16e}", bits, val);
        }
    }
}

/// Format the value into a buffer of `max_size` bytes in one style.
fn print_formatted(bits: u64, sem: Semantics, max_size: usize, sci: bool) {
    let style = if sci { "SC" } else { "HR" };
    let mut buffer = vec![0u8; max_size];
    match format_float_bits(bits, sem, &mut buffer, sci) {
        Ok(len) => {
            let text = String::from_utf8_lossy(&buffer[..len]);
            println!("{} format: {}, {}", style, text, len);
        }
        Err(err) => println!("Failed {} format: {}", style, err),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: float_roundtrip number_with_delim h|f|d [maxSize]");
        return ExitCode::SUCCESS;
    }

    let mut max_size = 32;
    if args.len() == 4 {
        match args[3].parse::<usize>() {
            Ok(n) => max_size = n,
            Err(_) => {
                eprintln!("Cant parse maxsize");
                return ExitCode::FAILURE;
            }
        }
    }

    let kind = args[2].as_bytes().first().copied().unwrap_or(0);
    let sem = match kind {
        b'h' => FP16,
        b'f' => FP32,
        b'd' => FP64,
        _ => {
            eprintln!("Failed: Unknown type");
            return ExitCode::FAILURE;
        }
    };

    let text = args[1].as_bytes();
    let parsed = match parse_float_signed(text, sem) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("Failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    print_value(kind, parsed.value);
    print_formatted(parsed.value, sem, max_size, false);
    print_formatted(parsed.value, sem, max_size, true);
    println!("{}", String::from_utf8_lossy(&text[parsed.end..]));
    ExitCode::SUCCESS
}
