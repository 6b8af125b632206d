mod swagger2;
