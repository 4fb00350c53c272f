macro_rules! import_models {
    ($x:ident) => {
        mod $x;
        pub use self::$x::*;
    };
}

import_models!(release);
import_models!(subtarget);
import_models!(package_set);
import_models!(manifest);
import_models!(image_request);
import_models!(image);
import_models!(imagebuilder);
import_models!(worker);
