#[macro_use]
mod common;

#[cfg(test)]
mod string {
    tests! {
        concat in string is OK
        "foobar"
    }

    tests! {
        multiline in string is OK
        "one"
        "two"
    }

    tests! {
        strings_are_not_numbers in string is ERR(70)
        "[line 1:11] RuntimeError at '+': Binary operation '+' is not supported between string type and number type"
    }

    tests! {
        unterminated in string is ERR(65)
        "[line 1:7] ScanError: Unterminated string"
    }
}
