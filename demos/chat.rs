use wordwash::{check, sanitize};

fn main() {
    // Clean messages pass through unchanged.
    show("Hello world!");

    // Profanity is censored token by token.
    show("fuck you");

    // Obfuscation is normalized before matching.
    show("sh1t happens");
    show("f.u.c.k");

    // Benign words containing banned substrings are left alone.
    show("the cockpit was cramped");

    // Mild words are flagged but not censored.
    show("damn");
}

fn show(text: &str) {
    let detection = check(text);
    println!(
        "{:?} -> {:?} (profane={}, confidence={:.2}, reason={})",
        text,
        sanitize(text),
        detection.profane,
        detection.confidence,
        detection.reason
    );
}
