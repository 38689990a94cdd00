use std::env;
use std::process::ExitCode;

use numstrconv::{half_to_f32, parse_float_signed, FP16, FP32, FP64};

///! Parses a float and compares the result with the standard library.
///!  cargo run --example parse_float 0.1 d

/// Print the encoding of the parsed value next to the standard library's
/// result for the same text.
fn report(text: &str, kind: u8, bits: u64) -> Result<(), String> {
    match kind {
        b'h' => {
            let val = half_to_f32(bits as u16);
            println!("NumStr: {:04x},{:.4e}", bits, val);
        }
        b'f' => {
            let val = f32::from_bits(bits as u32);
            println!("NumStr: {:08x},{:.7e}", bits, val);
            if let Ok(sys) = text.parse::<f32>() {
                println!("System: {:08x},{:.7e}", sys.to_bits(), sys);
            }
        }
        b'd' => {
            let val = f64::from_bits(bits);
            println!("NumStr: {:016x},{:.16e}", bits, val);
            if let Ok(sys) = text.parse::<f64>() {
                println!("System: {:016x},{:.16e}", sys.to_bits(), sys);
            }
        }
        _ => return Err("Unknown type".to_string()),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: parse_float number_with_delim h|f|d [numchars]");
        return ExitCode::SUCCESS;
    }

    let text = args[1].as_bytes();
    let mut len = text.len();
    if args.len() == 4 {
        if let Ok(n) = args[3].parse::<usize>() {
            if n != 0 {
                len = n.min(text.len());
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

    let res = parse_float_signed(&text[..len], sem)
        .map_err(|err| err.to_string())
        .and_then(|p| {
            let literal = String::from_utf8_lossy(&text[..p.end]);
            report(&literal, kind, p.value)?;
            Ok(p.end)
        });
    match res {
        Ok(end) => {
            println!("{}", String::from_utf8_lossy(&text[end..]));
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprintln!("Failed: {}", msg);
            ExitCode::FAILURE
        }
    }
}
