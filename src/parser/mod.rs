use pest::error::Error;

pub mod nestml_parser;
pub use nestml_parser::NestmlParser;
pub use nestml_parser::Rule as NestmlRule;

pub fn parse_nestml_string(text: &str) -> Result<Ast<'_>, Box<Error<NestmlRule>>> {
    nestml_parser::parse_string(text)
}

use crate::ast::Ast;

#[cfg(test)]
mod tests {
    use pest::Parser;

    use super::{NestmlParser, NestmlRule};

    const NESTML_FILES: &[(&str, &str)] = &[
        ("test_iaf_psc_alpha.nestml", include_str!("test_iaf_psc_alpha.nestml")),
        ("test_iaf_broken.nestml", include_str!("test_iaf_broken.nestml")),
    ];

    #[test]
    fn parse_examples() {
        for (filename, contents) in NESTML_FILES {
            let _list = NestmlParser::parse(NestmlRule::main, contents)
                .unwrap_or_else(|e| panic!("unsuccessful parse ({filename}) {e}"));
        }
    }
}
