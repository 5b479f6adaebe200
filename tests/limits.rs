#[macro_use]
mod common;

#[cfg(test)]
mod limits {
    tests! {
        too_many_arguments in limits is ERR(65)
        "[line 258:1] ParseError at '255': Cannot have more than 255 arguments"
    }

    tests! {
        too_many_parameters in limits is ERR(65)
        "[line 257:1] ParseError at 'p255': Cannot have more than 255 parameters"
    }
}
