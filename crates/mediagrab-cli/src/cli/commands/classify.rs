//! `mediagrab classify <url>`.

use mediagrab_core::classify::{route_for, FetchRoute};

pub fn run_classify(url: &str) {
    let label = match route_for(url) {
        FetchRoute::Direct => "direct",
        FetchRoute::Extractor => "extractor",
    };
    println!("{}", label);
}
