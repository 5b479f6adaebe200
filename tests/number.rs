#[macro_use]
mod common;

#[cfg(test)]
mod number {
    tests! {
        integer_display in number is OK
        "7"
        "7"
        "2.5"
        "0.30000000000000004"
    }

    tests! {
        negative_zero in number is OK
        "-0"
        "123456789"
    }

    tests! {
        trailing_dot_is_property_access in number is ERR(70)
        "[line 1:9] RuntimeError at 'foo': Only instances have properties"
    }

    tests! {
        leading_dot in number is ERR(65)
        "[line 1:7] ParseError at '.': Expect expression"
    }
}
