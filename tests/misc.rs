#[macro_use]
mod common;

#[cfg(test)]
mod misc {
    tests! {
        empty_file in misc is OK
    }

    tests! {
        precedence in misc is OK
        "13"
        "2"
        "true"
        "true"
    }

    tests! {
        unexpected_character in misc is ERR(65)
        "[line 1:11] ScanError: Unexpected character '|'"
    }

    tests! {
        multiple_scan_errors in misc is ERR(65)
        "[line 1:11] ScanError: Unexpected character '|'"
        "[line 2:9] ScanError: Unexpected character '@'"
    }
}
