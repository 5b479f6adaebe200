#[macro_use]
mod common;

#[cfg(test)]
mod call {
    tests! {
        native_clock in call is OK
        "true"
    }

    tests! {
        number in call is ERR(70)
        "[line 1:5] RuntimeError at ')': Can only call functions and classes"
    }

    tests! {
        string in call is ERR(70)
        "[line 1:7] RuntimeError at ')': Can only call functions and classes"
    }

    tests! {
        nil in call is ERR(70)
        "[line 1:5] RuntimeError at ')': Can only call functions and classes"
    }

    tests! {
        too_many_arguments in call is ERR(70)
        "[line 2:10] RuntimeError at ')': Expected 2 arguments but got 3"
    }

    tests! {
        too_few_arguments in call is ERR(70)
        "[line 2:3] RuntimeError at ')': Expected 1 arguments but got 0"
    }
}
