//! The JSON grammar, one function per production. Every function is entered
//! with the relevant look-ahead already current and leaves the look-ahead on
//! the first token after its production.

use crate::dom::{Json, JsonKind};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::strings;

const WS_NL: &[TokenKind] = &[TokenKind::Ws, TokenKind::Nl];
const WS: &[TokenKind] = &[TokenKind::Ws];
const DIGITS: &[TokenKind] = &[TokenKind::Digit, TokenKind::Zero];

/// Parse a single value at the current look-ahead.
pub(crate) fn value(p: &mut Parser<'_>) -> Json<'static> {
    match p.peek().kind() {
        TokenKind::LCurly => object(p),
        TokenKind::LBrack => array(p),
        TokenKind::Str => string(p),
        TokenKind::Hyphen | TokenKind::Zero | TokenKind::Digit => number(p),
        TokenKind::True | TokenKind::False => boolean(p),
        TokenKind::Null => null(p),
        _ => Json::error("unexpected token"),
    }
}

pub(crate) fn object(p: &mut Parser<'_>) -> Json<'static> {
    if !p.descend() {
        return Json::error("nesting too deep");
    }
    let object = object_body(p);
    p.ascend();

    object
}

fn object_body(p: &mut Parser<'_>) -> Json<'static> {
    let mut object = Json::object();
    p.bump(); // `{`
    p.skip(WS_NL);

    if p.peek().kind() == TokenKind::RCurly {
        p.bump();
        return object;
    }

    loop {
        if p.peek().kind() != TokenKind::Str {
            return Json::error("malformed object");
        }
        let key = match strings::parse(p.peek().data()) {
            Some(key) => key,
            None => return Json::error("malformed object"),
        };
        p.bump();
        p.skip(WS);

        if p.peek().kind() != TokenKind::Colon {
            return Json::error("malformed object");
        }
        p.bump();
        p.skip(WS);

        let value = value(p);
        if value.kind() == JsonKind::Error {
            // partial tuples are dropped with `object`
            return Json::error("malformed object");
        }
        if object.object_push_node(key, value).is_err() {
            return Json::error("malformed object");
        }
        p.skip(WS_NL);

        match p.peek().kind() {
            TokenKind::Comma => {
                p.bump();
                p.skip(WS_NL);
            }
            TokenKind::RCurly => {
                p.bump();
                return object;
            }
            _ => return Json::error("malformed object"),
        }
    }
}

pub(crate) fn array(p: &mut Parser<'_>) -> Json<'static> {
    if !p.descend() {
        return Json::error("nesting too deep");
    }
    let array = array_body(p);
    p.ascend();

    array
}

fn array_body(p: &mut Parser<'_>) -> Json<'static> {
    let mut array = Json::array();
    p.bump(); // `[`
    p.skip(WS_NL);

    if p.peek().kind() == TokenKind::RBrack {
        p.bump();
        return array;
    }

    loop {
        let element = value(p);
        if element.kind() == JsonKind::Error {
            p.recover();
            return Json::error("malformed array");
        }
        if array.array_push_node(element).is_err() {
            return Json::error("malformed array");
        }
        p.skip(WS_NL);

        match p.peek().kind() {
            TokenKind::Comma => {
                p.bump();
                p.skip(WS_NL);
            }
            TokenKind::RBrack => {
                p.bump();
                return array;
            }
            _ => {
                p.recover();
                return Json::error("malformed array");
            }
        }
    }
}

pub(crate) fn string(p: &mut Parser<'_>) -> Json<'static> {
    match strings::parse(p.peek().data()) {
        Some(text) => {
            p.bump();
            Json::owned_string(text)
        }
        None => {
            p.recover();
            Json::error("malformed string")
        }
    }
}

/// Assemble a number from the per-byte token run.
///
/// The grammar follows RFC 8259 except that an exponent must carry an
/// explicit sign.
pub(crate) fn number(p: &mut Parser<'_>) -> Json<'static> {
    let start = p.peek().index();
    let negative = p.peek().kind() == TokenKind::Hyphen;
    let mut integer = false;
    let mut fraction = false;

    if negative {
        p.bump();
    }

    match p.peek().kind() {
        TokenKind::Zero => {
            integer = true;
            p.bump();
            // no digit may follow a leading zero
            if matches!(p.peek().kind(), TokenKind::Digit | TokenKind::Zero) {
                return fail_number(p);
            }
        }
        TokenKind::Digit => {
            integer = true;
            p.skip(DIGITS);
        }
        _ => {}
    }

    if !integer {
        // a lone `-`
        return fail_number(p);
    }

    if p.peek().kind() == TokenKind::Dot {
        p.bump();
        if matches!(p.peek().kind(), TokenKind::Digit | TokenKind::Zero) {
            fraction = true;
            p.skip(DIGITS);
        } else {
            return fail_number(p);
        }
    }

    if p.peek().kind() == TokenKind::Exp {
        p.bump();
        if !matches!(p.peek().kind(), TokenKind::Hyphen | TokenKind::Plus) {
            return fail_number(p);
        }
        p.bump();
        if matches!(p.peek().kind(), TokenKind::Digit | TokenKind::Zero) {
            p.skip(DIGITS);
        } else {
            return fail_number(p);
        }
    }

    let end = p.peek().index();
    let text = &p.source()[start..end];
    let number: f64 = match text.parse() {
        Ok(number) => number,
        Err(_) => return fail_number(p),
    };

    if number.is_infinite() {
        log::warn!("number overflow while parsing `{text}`");
    }

    if fraction {
        Json::double(number)
    } else {
        Json::int(number as i64)
    }
}

fn fail_number(p: &mut Parser<'_>) -> Json<'static> {
    p.recover();
    Json::error("malformed number")
}

pub(crate) fn boolean(p: &mut Parser<'_>) -> Json<'static> {
    let truth = p.peek().kind() == TokenKind::True;
    p.bump();

    Json::boolean(truth)
}

pub(crate) fn null(p: &mut Parser<'_>) -> Json<'static> {
    p.bump();

    Json::null()
}
