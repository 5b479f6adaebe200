#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    tests! {
        line_at_eof in comment is OK
        "ok"
    }

    tests! {
        only_comment in comment is OK
    }

    tests! {
        around_code in comment is OK
        "ok"
    }

    tests! {
        unicode in comment is OK
        "ok"
    }
}
