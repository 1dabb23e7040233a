#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert arbitrary bytes to UTF-8 string (lossy conversion)
    if let Ok(input) = std::str::from_utf8(data) {
        // Parse the profile and run the read-side pipeline over it
        // This should not panic regardless of input
        if let Ok(profile) = cronista::export::parse_profile(input) {
            let operations = cronista::analyze::analyze_operations(&profile);
            let _ = cronista::analyze::find_bottlenecks(
                &operations,
                10.0,
                std::time::Duration::from_secs(5),
            );
            let _ = cronista::analyze::timeline(&profile, std::time::Duration::from_secs(10));
            let _ = cronista::summarize(&profile.into_snapshot(), 20);
        }
    }
});
