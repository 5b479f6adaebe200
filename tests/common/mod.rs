#[macro_export]
macro_rules! tests {
    ($file:ident in $scope:ident is OK $($expected:literal)*) => {
        #[test]
        fn $file() {
            use ember_lang::Ember;

            let mut expected = vec![$($expected),*];

            // if exists, concat expected lines with new lines
            let expected = match expected.len() {
                0 => "".to_string(),
                _ => {
                    // add empty string to end to add new line to end of output
                    expected.push("");
                    expected.join("\n")
                }
            };

            let mut output = Vec::new();
            let mut ember = Ember::new(&mut output);

            ember.run_file(&format!("tests/scripts/{}/{}.lox", stringify!($scope), stringify!($file)));

            // drop ember here to release the borrow before reading the output
            drop(ember);
            assert_eq!(expected, std::str::from_utf8(&output).unwrap());
        }
    };

    ($file:ident in $scope:ident is ERR($code:literal) $($expected:literal)+) => {
        #[test]
        fn $file() {
            use assert_cmd::Command;

            // output concats expected with new line
            let output = vec![$($expected),+].join("\n");
            let file = format!("tests/scripts/{}/{}.lox", stringify!($scope), stringify!($file));

            Command::cargo_bin("ember").unwrap()
                .arg(file)
                .assert()
                .stderr(format!("{output}\n"))
                .code($code);
        }
    };
}
