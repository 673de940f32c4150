#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Footer parsing must reject garbage with an error, never a panic
    if let Ok(footer) = colstripe::writer::read_file_footer(&mut Cursor::new(data)) {
        for stripe in &footer.stripes {
            let _ = colstripe::writer::read_stripe_footer(&mut Cursor::new(data), stripe);
        }
    }
});
